mod current;
mod form;
mod types;

pub use current::load_current_settings;
pub use form::{parse_form, parse_form_json, to_form_fields, FormError, FormField};
pub use types::{FeedSettings, IocType, LookupSpec, SetupSettings, UnknownIocType};
