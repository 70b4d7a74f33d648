pub mod aggregate;
pub mod alignment;
pub mod normalization;
pub mod report;
pub mod similarity;
pub mod simulation;
