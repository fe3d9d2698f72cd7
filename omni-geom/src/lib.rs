//! This crate contains the computational geometry that follows relative pose estimation
//! between two spherical cameras.
//!
//! ## Triangulation
//!
//! In this problem we know the projection matrices of the cameras and the bearing of the same
//! feature observed in each camera frame. We want to find the point of intersection of the rays.
//!
//! - `p` the point we are trying to triangulate
//! - `a` the bearing on the sphere of camera A
//! - `b` the bearing on the sphere of camera B
//! - `O` the optical center of a camera
//!
//! ```text
//!               p-----------b----O
//!              /
//!             /
//!            a
//!           /
//!          O
//! ```
//!
//! A spherical camera sees in every direction, so the rays may point anywhere, including
//! behind the camera in the pinhole sense.
//!
//! ## Relative pose
//!
//! An essential matrix decomposes into four relative poses. [`relative_pose::select_pose`]
//! triangulates the matches under each of them and keeps the one that places the points in
//! the direction of their bearings in both cameras.

#![no_std]

pub mod relative_pose;
pub mod triangulation;
