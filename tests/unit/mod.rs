//! Unit test modules.

mod storage_failure_test;
mod tracker_scenarios_test;
