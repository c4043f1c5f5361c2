//! Visibility kernel
//!
//! Decides what is worth drawing this frame: frustum containment, the ball
//! occluding sightlines, and clipping of the vertical guide line.

pub mod frustum;
pub mod guide_line;

pub use frustum::{Camera, Frustum};
pub use guide_line::{clip_guide_line, tangent_corrected_top};
