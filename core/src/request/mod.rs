/*
 * mod.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Staffetta, a format-agnostic request/response layer.
 *
 * Staffetta is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Staffetta is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Staffetta.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Request lifecycle: the descriptor, its one result record, the one-shot
//! completion signal, and the delivery callbacks.

pub mod descriptor;
pub mod listener;
pub mod response;
pub mod signal;

pub use descriptor::RequestDescriptor;
pub use listener::ResponseListener;
pub use response::{DecodedBody, HalLink, ResponseData};
pub use signal::{CompletionSignal, SignalOutcome};
