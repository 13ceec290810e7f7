use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpuError {
    #[error("instance count {0} does not fit in a u32 draw range")]
    TooManyInstances(usize),
}
