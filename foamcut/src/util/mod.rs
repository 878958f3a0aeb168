mod fpa;

#[doc(inline)]
pub use fpa::FPA;
#[doc(inline)]
pub use fpa::GEOM_TOLERANCE;
