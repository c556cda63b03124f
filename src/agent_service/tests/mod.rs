//! Unit tests for the agent service context.
