//! Recorder service API models
//!
//! Serde types for the REST contract exposed by the recorder service.

pub mod models;

pub use models::{
    decode_list, Device, DeviceListResponse, HealthSnapshot, ListError, RecordRequest,
    RecordResponse, Recording, RecordingState, StopRequest, StopResponse,
};
