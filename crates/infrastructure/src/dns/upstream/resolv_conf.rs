//! `nameserver` directives from resolv.conf-style files.

use tracing::debug;

/// Addresses of every well-formed `nameserver <addr>` line, in file order.
///
/// Lines with extra tokens are skipped, as are comments.
pub fn parse_nameservers(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            if tokens.next() != Some("nameserver") {
                return None;
            }
            let addr = tokens.next()?;
            if tokens.next().is_some() {
                debug!(line, "Skipping nameserver line with extra tokens");
                return None;
            }
            Some(addr)
        })
        .collect()
}
