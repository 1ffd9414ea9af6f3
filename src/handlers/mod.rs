// handlers/mod.rs - Two handler tiers
//
// Public (no organization) → Scoped (X-Org-Slug resolved by middleware)
pub mod public; // /, /health
pub mod scoped; // /api/*
