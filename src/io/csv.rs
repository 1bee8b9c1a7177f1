use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use csv::StringRecord;

use super::AdapterError;
use crate::models::{Buyer, MatchPair, Seller};

/// Byte-order mark the legacy Excel exports carry
pub(crate) const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

pub(crate) const SELLER_ID: &str = "양도자ID";
pub(crate) const SELLER_CODE: &str = "양도제품코드";
pub(crate) const SELLER_GRADE: &str = "양도자 등급";
pub(crate) const SELLER_PRICE: &str = "양도 금액";
pub(crate) const BUYER_ID: &str = "양수자ID";
pub(crate) const BUYER_CODE: &str = "양수제품코드";
pub(crate) const BUYER_CODE_ALIAS: &str = "양수 관심제품코드";
pub(crate) const BUYER_GRADE: &str = "양수자 등급";
pub(crate) const BUYER_BUDGET: &str = "양수 금액";
pub(crate) const NAME_COLUMN: &str = "이름";
pub(crate) const ADDRESS_COLUMN: &str = "주소";

/// Column order of both ranked output tables
pub const OUTPUT_COLUMNS: [&str; 21] = [
    "seller_id",
    "s_name",
    "s_addr",
    "s_code",
    "s_grade",
    "s_price",
    "buyer_id",
    "b_name",
    "b_addr",
    "b_code",
    "b_grade",
    "b_budget",
    "product_code_exact",
    "cat_sim",
    "price_fit",
    "region_sim",
    "grade_sim",
    "score",
    "explanation",
    "rank_for_seller",
    "rank_for_buyer",
];

pub(crate) fn open_csv(path: &Path) -> Result<csv::Reader<File>, AdapterError> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|source| AdapterError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Read the header row, tolerating a UTF-8 BOM and padded names
pub(crate) fn read_headers(
    reader: &mut csv::Reader<File>,
    path: &Path,
) -> Result<Vec<String>, AdapterError> {
    let headers = reader.headers().map_err(|source| AdapterError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect())
}

pub(crate) fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

pub(crate) fn require_column(
    headers: &[String],
    name: &str,
    path: &Path,
) -> Result<usize, AdapterError> {
    find_column(headers, name).ok_or_else(|| AdapterError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
    })
}

pub(crate) fn field(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or("").trim().to_string()
}

pub(crate) fn optional_field(record: &StringRecord, index: usize) -> Option<String> {
    let value = field(record, index);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse an amount cell, stripping digit-group commas
///
/// Unparseable or non-finite values become `None`; the scorers treat
/// that as a missing amount rather than failing the run.
pub(crate) fn numeric_field(record: &StringRecord, index: usize) -> Option<f64> {
    let raw = field(record, index).replace(',', "");
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Load seller listings from the legacy 양도자 CSV export
pub fn load_sellers(path: &Path) -> Result<Vec<Seller>, AdapterError> {
    let mut reader = open_csv(path)?;
    let headers = read_headers(&mut reader, path)?;

    let id_idx = require_column(&headers, SELLER_ID, path)?;
    let name_idx = require_column(&headers, NAME_COLUMN, path)?;
    let address_idx = require_column(&headers, ADDRESS_COLUMN, path)?;
    let code_idx = require_column(&headers, SELLER_CODE, path)?;
    let grade_idx = require_column(&headers, SELLER_GRADE, path)?;
    let price_idx = require_column(&headers, SELLER_PRICE, path)?;

    let mut sellers = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| AdapterError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        sellers.push(Seller {
            id: field(&record, id_idx),
            name: field(&record, name_idx),
            address: field(&record, address_idx),
            product_code: field(&record, code_idx),
            grade: optional_field(&record, grade_idx),
            price: numeric_field(&record, price_idx),
        });
    }
    Ok(sellers)
}

/// Load buyer inquiries from the legacy 양수자 CSV export
///
/// Older exports label the product-code column `양수 관심제품코드`;
/// both spellings are accepted.
pub fn load_buyers(path: &Path) -> Result<Vec<Buyer>, AdapterError> {
    let mut reader = open_csv(path)?;
    let headers = read_headers(&mut reader, path)?;

    let id_idx = require_column(&headers, BUYER_ID, path)?;
    let name_idx = require_column(&headers, NAME_COLUMN, path)?;
    let address_idx = require_column(&headers, ADDRESS_COLUMN, path)?;
    let code_idx = find_column(&headers, BUYER_CODE)
        .or_else(|| find_column(&headers, BUYER_CODE_ALIAS))
        .ok_or_else(|| AdapterError::MissingColumn {
            path: path.to_path_buf(),
            column: BUYER_CODE.to_string(),
        })?;
    let grade_idx = require_column(&headers, BUYER_GRADE, path)?;
    let budget_idx = require_column(&headers, BUYER_BUDGET, path)?;

    let mut buyers = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| AdapterError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        buyers.push(Buyer {
            id: field(&record, id_idx),
            name: field(&record, name_idx),
            address: field(&record, address_idx),
            interested_product_code: field(&record, code_idx),
            grade: optional_field(&record, grade_idx),
            budget: numeric_field(&record, budget_idx),
        });
    }
    Ok(buyers)
}

fn amount_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write one ranked table, denormalized against the input rosters
///
/// The file gets a UTF-8 BOM prefix so Korean text opens cleanly in
/// Excel, matching the exports the downstream team already consumes.
pub fn write_match_csv(
    path: &Path,
    pairs: &[MatchPair],
    sellers: &[Seller],
    buyers: &[Buyer],
) -> Result<(), AdapterError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| AdapterError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    let mut file = File::create(path).map_err(|source| AdapterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(UTF8_BOM).map_err(|source| AdapterError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(file);
    writer
        .write_record(OUTPUT_COLUMNS)
        .map_err(|source| AdapterError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let seller_index: HashMap<&str, &Seller> =
        sellers.iter().map(|s| (s.id.as_str(), s)).collect();
    let buyer_index: HashMap<&str, &Buyer> = buyers.iter().map(|b| (b.id.as_str(), b)).collect();

    for pair in pairs {
        let seller = seller_index.get(pair.seller_id.as_str()).copied();
        let buyer = buyer_index.get(pair.buyer_id.as_str()).copied();
        let exact = if pair.features.product_code_exact {
            "1.0"
        } else {
            "0.0"
        };

        writer
            .write_record([
                pair.seller_id.clone(),
                seller.map(|s| s.name.clone()).unwrap_or_default(),
                seller.map(|s| s.address.clone()).unwrap_or_default(),
                seller.map(|s| s.product_code.clone()).unwrap_or_default(),
                seller.and_then(|s| s.grade.clone()).unwrap_or_default(),
                amount_cell(seller.and_then(|s| s.price)),
                pair.buyer_id.clone(),
                buyer.map(|b| b.name.clone()).unwrap_or_default(),
                buyer.map(|b| b.address.clone()).unwrap_or_default(),
                buyer
                    .map(|b| b.interested_product_code.clone())
                    .unwrap_or_default(),
                buyer.and_then(|b| b.grade.clone()).unwrap_or_default(),
                amount_cell(buyer.and_then(|b| b.budget)),
                exact.to_string(),
                pair.features.cat_sim.to_string(),
                pair.features.price_fit.to_string(),
                pair.features.region_sim.to_string(),
                pair.features.grade_sim.to_string(),
                pair.score.to_string(),
                pair.explanation.clone(),
                pair.rank_for_seller.to_string(),
                pair.rank_for_buyer.to_string(),
            ])
            .map_err(|source| AdapterError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
    }

    writer.flush().map_err(|source| AdapterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
