// Data access layer
pub mod db {
    pub use crate::db::*;
}

pub mod storage {
    pub use crate::db_storage::*;
}
