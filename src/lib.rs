// SPDX-License-Identifier: Apache-2.0

pub mod activate;
pub mod discover;
pub mod hooks;
pub mod picker;
pub mod printer;
pub mod types;
