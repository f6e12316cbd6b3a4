pub mod csbk_pdu;
pub mod csbko;

pub use csbk_pdu::Csbk;
pub use csbko::Csbko;
