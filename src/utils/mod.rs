pub mod abort_guard;
