//! Settings Entity Module
//!
//! 관리자가 편집하는 전역 설정(`AppSettings`)입니다. 문서 저장소의
//! `global_settings/app` 문서 하나에 저장됩니다.

pub mod app_settings;

pub use app_settings::AppSettings;
