//! Plain request/response values exchanged with the kernel. Parsing the wire
//! format is the host's job; the kernel only reads the requested path.
pub mod output;
pub mod request;
pub mod response;

pub use output::{BufferedOutput, OutputChannel, SharedOutput, StdoutOutput};
pub use request::Request;
pub use response::Response;
