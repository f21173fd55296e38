use std::collections::HashMap;

/// Category of telemetry an envelope carries. Forwarders declare the one
/// category they accept; the router uses it to decide which batches reach them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SniffType {
    Unknown = 0,
    TracingType = 1,
    LogType = 2,
    MeterType = 3,
    EventType = 4,
    ProfileType = 5,
    ManagementType = 6,
}

/// Envelope event: one unit of a processed batch, wrapping exactly one payload.
///
/// Created by the upstream stage and handed to forwarders by reference.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SniffData {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(int64, tag = "2")]
    pub timestamp: i64,
    #[prost(map = "string, string", tag = "3")]
    pub meta: HashMap<String, String>,
    #[prost(enumeration = "SniffType", tag = "4")]
    pub sniff_type: i32,
    #[prost(bool, tag = "5")]
    pub remote: bool,
    #[prost(oneof = "sniff_data::Data", tags = "6, 7, 8, 9, 10, 11")]
    pub data: Option<sniff_data::Data>,
}

pub mod sniff_data {
    /// Payload variants. Every variant holds the serialized bytes exactly as
    /// the upstream stage received them.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(bytes, tag = "6")]
        Event(Vec<u8>),
        #[prost(bytes, tag = "7")]
        Log(Vec<u8>),
        #[prost(bytes, tag = "8")]
        Segment(Vec<u8>),
        #[prost(bytes, tag = "9")]
        Meter(Vec<u8>),
        #[prost(bytes, tag = "10")]
        Profile(Vec<u8>),
        /// Out-of-band span annotation produced by the kernel-level (eBPF) agent.
        #[prost(bytes, tag = "11")]
        SpanAttachedEvent(Vec<u8>),
    }
}

/// An ordered batch of envelope events, supplied whole per forward call.
pub type BatchEvents = [SniffData];

impl SniffData {
    /// Build an envelope around a payload, deriving the category from it.
    pub fn new(name: impl Into<String>, data: sniff_data::Data) -> Self {
        let sniff_type = match data {
            sniff_data::Data::Segment(_) | sniff_data::Data::SpanAttachedEvent(_) => {
                SniffType::TracingType
            }
            sniff_data::Data::Log(_) => SniffType::LogType,
            sniff_data::Data::Meter(_) => SniffType::MeterType,
            sniff_data::Data::Event(_) => SniffType::EventType,
            sniff_data::Data::Profile(_) => SniffType::ProfileType,
        };
        Self {
            name: name.into(),
            sniff_type: sniff_type as i32,
            data: Some(data),
            ..Default::default()
        }
    }

    /// Category declared on the envelope; unknown values map to `Unknown`.
    pub fn kind(&self) -> SniffType {
        SniffType::try_from(self.sniff_type).unwrap_or(SniffType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_category_from_payload() {
        let seg = SniffData::new("seg", sniff_data::Data::Segment(vec![1]));
        assert_eq!(seg.kind(), SniffType::TracingType);

        let attached = SniffData::new("ebpf", sniff_data::Data::SpanAttachedEvent(vec![]));
        assert_eq!(attached.kind(), SniffType::TracingType);

        let log = SniffData::new("log", sniff_data::Data::Log(vec![]));
        assert_eq!(log.kind(), SniffType::LogType);
    }

    #[test]
    fn unknown_category_value() {
        let data = SniffData {
            sniff_type: 42,
            ..Default::default()
        };
        assert_eq!(data.kind(), SniffType::Unknown);
    }
}
