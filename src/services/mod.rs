/*
 * Responsibility
 * - auth: bearer token 検証 (AuthGate + identity provider)
 * - orchestrator: workflow orchestrator への転送
 */
pub mod auth;
pub mod orchestrator;
