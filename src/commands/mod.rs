/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `analyze`   — Streaming analysis with incremental rendering
- `visualize` — Batch visualization with image downloads
- `status`    — Backend health check

These handlers are intentionally small and use the library components:
the stream pipeline, the batch client, and media helpers.
*/

pub mod analyze;
pub mod status;
pub mod visualize;
