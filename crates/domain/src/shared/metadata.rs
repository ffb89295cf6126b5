use std::collections::HashMap;

/// Opaque key-value bag supplied by callers for correlation purposes
/// (e.g. the originating vaccine or appointment id). The scheduler never
/// interprets it, it is only forwarded into the notification payload.
pub type Metadata = HashMap<String, String>;
