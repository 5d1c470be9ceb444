pub mod edit_form;
pub mod metadata;
pub mod record;
