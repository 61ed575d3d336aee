//! falsec's leaf components: a byte-at-a-time source reader with
//! line/column tracking, and a growable buffer used once per string
//! literal.

pub mod growbuf;
pub mod reader;

pub use growbuf::GrowBuffer;
pub use reader::SourceReader;
