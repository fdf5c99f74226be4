pub mod query_parameter;
pub mod record;
