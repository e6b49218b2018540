//! Customer Data Platform specifics layered on the generic pipeline.

mod interceptor;

pub use interceptor::{CdpEventBuildInterceptor, DATA_SOURCE_ID_PARAM, GIO_ID_PARAM};
