// Loop-scope annotations carried by enter-loop events.

use crate::domain::program::ForKind;

/// How a loop scope is executed or bound to hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Annotation {
    Serial,
    Parallel,
    Vectorized,
    Unrolled,
    BlockX,
    BlockY,
    BlockZ,
    ThreadX,
    ThreadY,
    ThreadZ,
    VirtualThread,
    Pragma,
}

impl Annotation {
    /// Map a thread tag (`blockIdx.x`, `threadIdx.y`, `vthread`, ...) to its
    /// annotation. Unknown tags are treated as pragmas.
    pub fn from_thread_tag(tag: &str) -> Self {
        match tag {
            "blockIdx.x" => Annotation::BlockX,
            "blockIdx.y" => Annotation::BlockY,
            "blockIdx.z" => Annotation::BlockZ,
            "threadIdx.x" => Annotation::ThreadX,
            "threadIdx.y" => Annotation::ThreadY,
            "threadIdx.z" => Annotation::ThreadZ,
            t if t.starts_with("vthread") => Annotation::VirtualThread,
            _ => Annotation::Pragma,
        }
    }
}

impl From<ForKind> for Annotation {
    fn from(kind: ForKind) -> Self {
        match kind {
            ForKind::Serial => Annotation::Serial,
            ForKind::Parallel => Annotation::Parallel,
            ForKind::Vectorized => Annotation::Vectorized,
            ForKind::Unrolled => Annotation::Unrolled,
        }
    }
}
