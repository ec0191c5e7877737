pub mod strip_insertions;
