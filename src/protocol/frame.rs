/// Parser for newline-delimited request frames
pub struct Parser;

impl Parser {
    /// Parse the next request from buffer, return (request, consumed_bytes) if a
    /// complete line is available. The trailing `\n` and an optional `\r`
    /// before it are not part of the request.
    pub fn parse(buffer: &[u8]) -> Option<(&[u8], usize)> {
        let newline = buffer.iter().position(|&b| b == b'\n')?;
        let line = &buffer[..newline];
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        Some((line, newline + 1))
    }
}
