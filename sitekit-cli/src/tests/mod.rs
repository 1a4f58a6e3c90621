//! Shared test harness modules for the sitekit CLI.

use super::*;

mod helpers;
