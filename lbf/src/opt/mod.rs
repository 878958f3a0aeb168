pub mod lbf_nest;
pub mod loss;
pub mod search;
