//! Native tracing records as reported by language agents.
//!
//! Only decoding is needed on the forwarding path; the field layout follows
//! the agent's `SegmentObject` message so that segment bytes produced by the
//! agents decode directly.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SegmentObject {
    #[prost(string, tag = "1")]
    pub trace_id: String,
    #[prost(string, tag = "2")]
    pub trace_segment_id: String,
    #[prost(message, repeated, tag = "3")]
    pub spans: Vec<SpanObject>,
    #[prost(string, tag = "4")]
    pub service: String,
    #[prost(string, tag = "5")]
    pub service_instance: String,
    #[prost(bool, tag = "6")]
    pub is_size_limited: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SpanObject {
    #[prost(int32, tag = "1")]
    pub span_id: i32,
    #[prost(int32, tag = "2")]
    pub parent_span_id: i32,
    #[prost(int64, tag = "3")]
    pub start_time: i64,
    #[prost(int64, tag = "4")]
    pub end_time: i64,
    #[prost(string, tag = "6")]
    pub operation_name: String,
    #[prost(string, tag = "7")]
    pub peer: String,
    #[prost(enumeration = "SpanType", tag = "8")]
    pub span_type: i32,
    #[prost(enumeration = "SpanLayer", tag = "9")]
    pub span_layer: i32,
    #[prost(int32, tag = "10")]
    pub component_id: i32,
    #[prost(bool, tag = "11")]
    pub is_error: bool,
    #[prost(message, repeated, tag = "12")]
    pub tags: Vec<KeyStringValuePair>,
    #[prost(bool, tag = "14")]
    pub skip_analysis: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KeyStringValuePair {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SpanType {
    Entry = 0,
    Exit = 1,
    Local = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SpanLayer {
    Unknown = 0,
    Database = 1,
    RpcFramework = 2,
    Http = 3,
    Mq = 4,
    Cache = 5,
    Faas = 6,
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;

    #[test]
    fn decodes_nested_spans() {
        let segment = SegmentObject {
            trace_id: "t-1".into(),
            trace_segment_id: "s-1".into(),
            spans: vec![SpanObject {
                span_id: 0,
                parent_span_id: -1,
                operation_name: "GET /orders".into(),
                span_type: SpanType::Entry as i32,
                span_layer: SpanLayer::Http as i32,
                tags: vec![KeyStringValuePair {
                    key: "http.method".into(),
                    value: "GET".into(),
                }],
                ..Default::default()
            }],
            service: "orders".into(),
            ..Default::default()
        };

        let decoded = SegmentObject::decode(segment.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded.trace_segment_id, "s-1");
        assert_eq!(decoded.spans[0].span_layer(), SpanLayer::Http);
        assert_eq!(decoded.spans[0].tags[0].value, "GET");
    }

    #[test]
    fn truncated_bytes_fail() {
        // Field 2 announces five bytes, only one follows.
        assert!(SegmentObject::decode(&[0x12, 0x05, b'a'][..]).is_err());
    }
}
