use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};

use super::csv::{field, open_csv, optional_field, read_headers, require_column};
use super::AdapterError;
use crate::models::ProductMeta;

pub(crate) const META_CODE: &str = "상품코드";
pub(crate) const META_BRAND: &str = "브랜드";
pub(crate) const META_MAJOR: &str = "대카테고리";
pub(crate) const META_MID: &str = "중카테고리";
pub(crate) const META_MINOR: &str = "소카테고리";

/// Load the product catalog from the first sheet of an XLSX workbook
///
/// A `.csv` file with the same header is accepted as well, keyed off
/// the file extension. Rows without a product code are skipped;
/// duplicate codes are resolved first-wins by `ProductCatalog`.
pub fn load_product_meta(path: &Path) -> Result<Vec<ProductMeta>, AdapterError> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        load_meta_csv(path)
    } else {
        load_meta_xlsx(path)
    }
}

fn load_meta_xlsx(path: &Path) -> Result<Vec<ProductMeta>, AdapterError> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| AdapterError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;
    let range = match workbook.worksheet_range_at(0) {
        Some(result) => result.map_err(|source| AdapterError::Workbook {
            path: path.to_path_buf(),
            source,
        })?,
        None => {
            return Err(AdapterError::EmptySheet {
                path: path.to_path_buf(),
            })
        }
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_string(cell).unwrap_or_default())
            .collect(),
        None => {
            return Err(AdapterError::EmptySheet {
                path: path.to_path_buf(),
            })
        }
    };

    let code_idx = require_column(&headers, META_CODE, path)?;
    let brand_idx = require_column(&headers, META_BRAND, path)?;
    let major_idx = require_column(&headers, META_MAJOR, path)?;
    let mid_idx = require_column(&headers, META_MID, path)?;
    let minor_idx = require_column(&headers, META_MINOR, path)?;

    let mut entries = Vec::new();
    for row in rows {
        let code = match row.get(code_idx).and_then(cell_string) {
            Some(code) => code,
            None => continue,
        };
        entries.push(ProductMeta {
            code,
            brand: row.get(brand_idx).and_then(cell_string),
            category_major: row.get(major_idx).and_then(cell_string),
            category_mid: row.get(mid_idx).and_then(cell_string),
            category_minor: row.get(minor_idx).and_then(cell_string),
        });
    }
    Ok(entries)
}

fn load_meta_csv(path: &Path) -> Result<Vec<ProductMeta>, AdapterError> {
    let mut reader = open_csv(path)?;
    let headers = read_headers(&mut reader, path)?;

    let code_idx = require_column(&headers, META_CODE, path)?;
    let brand_idx = require_column(&headers, META_BRAND, path)?;
    let major_idx = require_column(&headers, META_MAJOR, path)?;
    let mid_idx = require_column(&headers, META_MID, path)?;
    let minor_idx = require_column(&headers, META_MINOR, path)?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| AdapterError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let code = field(&record, code_idx);
        if code.is_empty() {
            continue;
        }
        entries.push(ProductMeta {
            code,
            brand: optional_field(&record, brand_idx),
            category_major: optional_field(&record, major_idx),
            category_mid: optional_field(&record, mid_idx),
            category_minor: optional_field(&record, minor_idx),
        });
    }
    Ok(entries)
}

/// Render a cell as trimmed text; numeric codes come out of Excel as
/// floats and are printed without the trailing `.0`
fn cell_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
