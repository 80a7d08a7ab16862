//! 공통 유틸리티 함수 모듈
//!
//! - [`string_utils`] - 자유 입력 문자열 정리, 쉼표 목록 분리

pub mod string_utils;
