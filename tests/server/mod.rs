use actix_web::{App, HttpResponse, HttpServer, web};

/// Page matching the canonical "Example Domain" audit scenario: one
/// H1, no meta description, no CTAs, no links.
const EXAMPLE_DOMAIN: &str = r#"<!DOCTYPE html>
<html>
<head><title>Example Domain</title></head>
<body>
  <h1>Example Domain</h1>
  <p>This domain is for use in illustrative examples in documents without prior coordination.</p>
</body>
</html>"#;

const FULL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Salon Lumiere - Coiffure et beaute</title>
  <meta name="description" content="Salon de coiffure au centre-ville: coupes, couleurs et soins, sur rendez-vous.">
</head>
<body>
  <h1>Salon Lumiere</h1>
  <h2>Nos prestations</h2>
  <h3>Coupes et couleurs</h3>
  <p>Notre equipe vous accueille du mardi au samedi pour des coupes et des couleurs sur mesure.</p>
  <p>Les produits que nous utilisons sont choisis pour respecter vos cheveux et l'environnement.</p>
  <p>tiny</p>
  <button>Prendre rendez-vous</button>
  <a class="btn" href="/tarifs">Voir les tarifs</a>
  <input type="submit" value="Envoyer">
  <a href="/contact">Contact</a>
  <a href="mailto:bonjour@salon-lumiere.example">Nous ecrire</a>
  <a href="/equipe">L'equipe</a>
  <img src="/salon.jpg" alt="Interieur du salon">
  <img src="/coupe.jpg">
</body>
</html>"#;

fn caps_page() -> String {
    let mut body = String::new();
    for i in 0..30 {
        body.push_str(&format!(
            "<p>Paragraph number {} padded well past the thirty character floor.</p>\n",
            i
        ));
    }
    for i in 0..25 {
        body.push_str(&format!("<a href=\"/page-{}\">Link {}</a>\n", i, i));
    }
    for i in 0..20 {
        body.push_str(&format!("<img src=\"/img-{}.png\" alt=\"image {}\">\n", i, i));
    }
    format!(
        "<!DOCTYPE html><html><head><title>Caps</title></head><body>{}</body></html>",
        body
    )
}

/// Starts a fixture server on an ephemeral port and returns its base URL.
pub async fn get_test_server_url() -> String {
    let http_server = HttpServer::new(|| {
        App::new()
            .route(
                "/example-domain.html",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/html")
                        .body(EXAMPLE_DOMAIN)
                }),
            )
            .route(
                "/full-page.html",
                web::get().to(|| async {
                    HttpResponse::Ok().content_type("text/html").body(FULL_PAGE)
                }),
            )
            .route(
                "/caps.html",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/html")
                        .body(caps_page())
                }),
            )
            .route(
                "/not-found",
                web::get().to(|| async { HttpResponse::NotFound().body("Not Found") }),
            )
    })
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    url
}
