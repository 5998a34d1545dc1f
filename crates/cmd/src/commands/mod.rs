// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod cat;
pub mod check;
pub mod ls;
pub mod privileges;
pub mod stat;

pub use cat::cat_command;
pub use check::check_command;
pub use ls::ls_command;
pub use privileges::privileges_command;
pub use stat::stat_command;
