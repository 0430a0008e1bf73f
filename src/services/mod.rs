pub mod forms_api;
