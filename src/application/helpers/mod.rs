pub mod attribute_query;
