use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::objects::get::GetObjectRequest;
use crate::http::Escape;

/// Byte range of a download. Both bounds are inclusive.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Range(pub Option<u64>, pub Option<u64>);

impl Range {
    /// Range: bytes=0-1999 (first 2000 bytes)
    /// Range: bytes=-2000 (last 2000 bytes)
    /// Range: bytes=2000- (from byte 2000 to end of file)
    pub fn header_value(&self) -> Option<String> {
        match (self.0, self.1) {
            (Some(from), Some(to)) => Some(format!("bytes={from}-{to}")),
            (Some(from), None) => Some(format!("bytes={from}-")),
            (None, Some(reverse_from)) => Some(format!("bytes=-{reverse_from}")),
            (None, None) => None,
        }
    }

    fn with_header(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.header_value() {
            Some(value) => builder.header(reqwest::header::RANGE, value),
            None => builder,
        }
    }
}

pub(crate) fn build(base_url: &str, client: &Client, req: &GetObjectRequest, range: &Range) -> RequestBuilder {
    let url = format!("{}/b/{}/o/{}?alt=media", base_url, req.bucket.escape(), req.object.escape());
    range.with_header(client.get(url).query(&req))
}

#[cfg(test)]
mod test {
    use crate::http::objects::download::Range;

    #[test]
    fn test_range_header() {
        assert_eq!(Range(Some(0), Some(1999)).header_value().as_deref(), Some("bytes=0-1999"));
        assert_eq!(Range(None, Some(2000)).header_value().as_deref(), Some("bytes=-2000"));
        assert_eq!(Range(Some(2000), None).header_value().as_deref(), Some("bytes=2000-"));
        assert_eq!(Range::default().header_value(), None);
    }
}
