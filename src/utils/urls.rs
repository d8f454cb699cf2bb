use actix_web::HttpRequest;
use url::form_urlencoded;

/// "<scheme>://<host>" de la requête courante (respecte X-Forwarded-* via connection_info)
pub fn origin(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

pub fn absolute_url(req: &HttpRequest, path: &str) -> String {
    format!("{}{}", origin(req), path)
}

/// Base des URLs médias pour une requête donnée : "<origin><MEDIA_URL>"
#[derive(Debug, Clone)]
pub struct MediaLinks {
    base: String,
}

impl MediaLinks {
    pub fn new(req: &HttpRequest, media_prefix: &str) -> Self {
        Self {
            base: absolute_url(req, media_prefix),
        }
    }

    pub fn url(&self, relative: Option<&str>) -> Option<String> {
        relative.map(|path| format!("{}{}", self.base, path))
    }
}

/// Paramètres de la query string dans l'ordre, clés répétées conservées (?tags=a&tags=b)
pub fn query_pairs(req: &HttpRequest) -> Vec<(String, String)> {
    form_urlencoded::parse(req.query_string().as_bytes())
        .into_owned()
        .collect()
}

pub fn query_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

pub fn query_values<'a>(pairs: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

/// Valeur booléenne façon query string : "1", "true" (insensible à la casse)
pub fn query_flag(pairs: &[(String, String)], key: &str) -> bool {
    matches!(
        query_value(pairs, key).map(|v| v.to_ascii_lowercase()),
        Some(ref v) if v == "1" || v == "true"
    )
}

/// Reconstruit l'URL absolue de la requête en remplaçant `key` (None = retiré).
/// NormalizePath a retiré le '/' final : on le remet, forme canonique de l'API.
pub fn replace_query_param(req: &HttpRequest, key: &str, value: Option<&str>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in query_pairs(req) {
        if k != key {
            serializer.append_pair(&k, &v);
        }
    }
    if let Some(value) = value {
        serializer.append_pair(key, value);
    }

    let query = serializer.finish();
    let path = match req.path() {
        p if p.ends_with('/') => absolute_url(req, p),
        p => absolute_url(req, &format!("{}/", p)),
    };
    if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_query_helpers() {
        let req = TestRequest::get()
            .uri("/api/recipes/?tags=lunch&tags=dinner&is_favorited=1&author=3")
            .to_http_request();
        let pairs = query_pairs(&req);

        assert_eq!(query_values(&pairs, "tags"), vec!["lunch", "dinner"]);
        assert_eq!(query_value(&pairs, "author"), Some("3"));
        assert!(query_flag(&pairs, "is_favorited"));
        assert!(!query_flag(&pairs, "is_in_shopping_cart"));
    }

    #[test]
    fn test_media_links() {
        let req = TestRequest::get()
            .uri("/api/recipes/1/")
            .insert_header(("host", "foodgram.test"))
            .to_http_request();
        let links = MediaLinks::new(&req, "/media/");

        assert_eq!(
            links.url(Some("recipes/images/a.png")).as_deref(),
            Some("http://foodgram.test/media/recipes/images/a.png")
        );
        assert_eq!(links.url(None), None);
    }

    #[test]
    fn test_replace_query_param() {
        let req = TestRequest::get()
            .uri("/api/users/?limit=2&page=2")
            .insert_header(("host", "foodgram.test"))
            .to_http_request();

        assert_eq!(
            replace_query_param(&req, "page", Some("3")),
            "http://foodgram.test/api/users/?limit=2&page=3"
        );
        assert_eq!(
            replace_query_param(&req, "page", None),
            "http://foodgram.test/api/users/?limit=2"
        );
    }

    #[test]
    fn test_replace_query_param_restores_trailing_slash() {
        // Chemin tel que NormalizePath::trim() le laisse
        let req = TestRequest::get()
            .uri("/api/users?limit=2&page=2")
            .insert_header(("host", "foodgram.test"))
            .to_http_request();

        assert_eq!(
            replace_query_param(&req, "page", Some("1")),
            "http://foodgram.test/api/users/?limit=2&page=1"
        );
    }
}
