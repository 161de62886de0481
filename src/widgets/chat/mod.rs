// Chat message entry - a widget for displaying one chat message
//
// Module layout mirrors the dispatch pipeline:
// - content: the value model (text / bytes / file record / composite) and
//   the optional MIME sniffer
// - dispatch: MIME -> strategy mapping and the ordered candidate chain
// - renderable: the tree a strategy produces, plus post-processing and the
//   precomputed streaming path
// - avatar: user-name -> avatar resolution
// - message: the entry itself (state, update(), stream(), copy extraction)
// - view: ratatui rendering of an entry

pub mod avatar;
pub mod content;
pub mod dispatch;
pub mod message;
pub mod renderable;
pub mod view;
