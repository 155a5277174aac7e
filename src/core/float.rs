use num_traits::{Float, FromPrimitive, Signed};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::ops::AddAssign;

// A Float trait that captures the requirements we need for the various places
// we need floats. These requirements are imposed by ndarray-stats and serde.
pub trait ClusterFloat:
    Float
    + Debug
    + Display
    + Default
    + AddAssign
    + Serialize
    + DeserializeOwned
    + Signed
    + Copy
    + Sync
    + Send
    + FromPrimitive
    + 'static
{
}

impl ClusterFloat for f32 {}
impl ClusterFloat for f64 {}
