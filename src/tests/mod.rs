// Copyright 2025 the Alinea Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod test_basic;
mod test_clusters;
mod test_paint;
mod test_wrap;
mod utils;
