use actix_web::HttpRequest;
use serde::Serialize;

use crate::error::ApiError;
use crate::utils::urls::{query_value, replace_query_param};

pub const DEFAULT_PAGE_SIZE: u64 = 6;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const PAGE_PARAM: &str = "page";
pub const LIMIT_PARAM: &str = "limit";

/// Réponse paginée : {count, next, previous, results}
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub page: u64,  // commence à 1
    pub limit: u64,
}

impl Pagination {
    /// `page` invalide -> 404, `limit` invalide -> taille par défaut
    pub fn from_query(pairs: &[(String, String)]) -> Result<Self, ApiError> {
        let page = match query_value(pairs, PAGE_PARAM) {
            None => 1,
            Some(raw) => match raw.parse::<u64>() {
                Ok(p) if p >= 1 => p,
                _ => return Err(ApiError::not_found("Invalid page.")),
            },
        };

        let limit = query_value(pairs, LIMIT_PARAM)
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|l| *l > 0)
            .map(|l| l.min(MAX_PAGE_SIZE))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    pub fn num_pages(&self, count: u64) -> u64 {
        count.div_ceil(self.limit).max(1)
    }

    /// La page 1 existe toujours, même vide
    pub fn ensure_exists(&self, count: u64) -> Result<(), ApiError> {
        if self.page > self.num_pages(count) {
            return Err(ApiError::not_found("Invalid page."));
        }
        Ok(())
    }

    pub fn wrap<T>(&self, req: &HttpRequest, count: u64, results: Vec<T>) -> Paginated<T> {
        let next = (self.page < self.num_pages(count))
            .then(|| replace_query_param(req, PAGE_PARAM, Some(&(self.page + 1).to_string())));

        let previous = match self.page {
            1 => None,
            2 => Some(replace_query_param(req, PAGE_PARAM, None)),
            p => Some(replace_query_param(req, PAGE_PARAM, Some(&(p - 1).to_string()))),
        };

        Paginated {
            count,
            next,
            previous,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn pairs(query: &[(&str, &str)]) -> Vec<(String, String)> {
        query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let p = Pagination::from_query(&[]).unwrap();
        assert_eq!(p, Pagination { page: 1, limit: DEFAULT_PAGE_SIZE });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_limit_is_clamped() {
        let p = Pagination::from_query(&pairs(&[("limit", "1000"), ("page", "3")])).unwrap();
        assert_eq!(p.limit, MAX_PAGE_SIZE);
        assert_eq!(p.offset(), 200);

        let p = Pagination::from_query(&pairs(&[("limit", "abc")])).unwrap();
        assert_eq!(p.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_invalid_page() {
        assert!(Pagination::from_query(&pairs(&[("page", "0")])).is_err());
        assert!(Pagination::from_query(&pairs(&[("page", "two")])).is_err());

        let p = Pagination { page: 3, limit: 5 };
        assert!(p.ensure_exists(10).is_err());
        assert!(p.ensure_exists(11).is_ok());
        assert!(Pagination { page: 1, limit: 5 }.ensure_exists(0).is_ok());
    }

    #[test]
    fn test_links() {
        let req = TestRequest::get()
            .uri("/api/recipes/?limit=2&page=2")
            .insert_header(("host", "foodgram.test"))
            .to_http_request();
        let p = Pagination { page: 2, limit: 2 };

        let page = p.wrap(&req, 5, vec![1, 2]);
        assert_eq!(page.next.as_deref(), Some("http://foodgram.test/api/recipes/?limit=2&page=3"));
        assert_eq!(page.previous.as_deref(), Some("http://foodgram.test/api/recipes/?limit=2"));

        let last = Pagination { page: 3, limit: 2 }.wrap(&req, 5, vec![5]);
        assert!(last.next.is_none());
    }
}
