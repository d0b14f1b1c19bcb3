/// mockall-generated [`CommandRunner`](perfaware_core::CommandRunner).
pub mod runner;
