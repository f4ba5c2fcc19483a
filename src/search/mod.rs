pub mod typeahead;
pub mod highlight;
pub mod results;
pub mod service;
