// SPDX-License-Identifier: GPL-3.0-only

pub(crate) mod groups;
pub(crate) mod usage;
