//! Configuration Module
//!
//! 환경변수 기반 설정 (12-Factor App)
//! - Docker/K8s 배포 시 환경별 설정 분리 용이
//! - from_env()에서 형식 검증 → 잘못된 값이면 시작 시점에 실패 (fail-fast)

use std::env;
use anyhow::{Context, Result};

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버 포트 (기본값: 3001)
    pub port: u16,

    /// SQLite 연결 문자열
    /// 형식: sqlite://path/to/library.db
    pub database_url: String,

    /// 커넥션 풀 최대 크기 (기본값: 5)
    pub max_connections: u32,

    /// 환경 (development, staging, production)
    pub environment: Environment,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

impl Config {
    /// 환경변수에서 설정 로드
    ///
    /// # Optional Environment Variables
    ///
    /// - `PORT`: 서버 포트 (기본값: 3001)
    /// - `DATABASE_URL`: SQLite 파일 경로 (기본값: sqlite://library.db, 없으면 생성)
    /// - `DB_MAX_CONNECTIONS`: 풀 크기 (기본값: 5)
    /// - `ENVIRONMENT`: development | staging | production
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 키 조회 함수로 설정 구성 (테스트에서 프로세스 환경과 분리)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::parse(
            &lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        );

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "3001".to_string())
                .parse()
                .context("PORT must be a valid number")?,

            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://library.db".to_string()),

            max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a valid number")?,

            environment,
        })
    }

    /// 프로덕션 환경인지 확인
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}
