pub mod fs_runner;
