// Domain-layer modules and shared errors/models
pub mod duplication {
    pub use crate::client_duplication::*;
    pub use crate::duplication::*;
    pub use crate::installment_duplication::*;
    pub use crate::obligation_duplication::*;
}

pub mod calendar {
    pub use crate::business_days::*;
    pub use crate::dates::*;
    pub use crate::fiscal::*;
    pub use crate::installment_plan::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
