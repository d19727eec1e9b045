/*
 * Responsibility
 * - API version ごとの router を束ねる
 */
pub mod v1;
