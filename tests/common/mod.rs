#![allow(dead_code)]

pub use taskwave_test_utils::call_log::{CallEvent, CallLog};
pub use taskwave_test_utils::fixtures;
pub use taskwave_test_utils::{init_tracing, with_timeout};
