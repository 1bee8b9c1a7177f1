// Model exports
pub mod domain;
pub mod report;
pub mod requests;

pub use domain::{
    Buyer, BuyerCard, GradeTable, MatchPair, MatchWeights, PairFeatures, ProductCatalog,
    ProductMeta, RegionParts, Seller, SellerCard,
};
pub use report::CalibrationReport;
pub use requests::{CalibrationRequest, MatchRequest};
