pub mod bson;
pub mod codec;
#[cfg(feature = "serde")]
pub mod de;
mod error;
pub mod reader;
mod util;
pub mod uuid;
pub mod value;

pub use bson::subtype::*;
pub use bson::*;
pub use codec::*;
pub use error::*;
pub use reader::markable::MarkableCursor;
pub use reader::*;
pub(crate) use util::*;
pub use uuid::codec::UuidCodec;
pub use uuid::*;
pub use value::*;
