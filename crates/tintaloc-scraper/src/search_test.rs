use super::*;

#[test]
fn extracts_urls_from_redirect_hrefs() {
    let html = r#"
        <a href="/url?q=https%3A%2F%2Floja1.com.br%2Ftintas&amp;sa=U&amp;ved=abc">Loja 1</a>
        <a href="/url?q=https%3A%2F%2Floja2.com.br%2F&amp;sa=U">Loja 2</a>
    "#;
    let urls = extract_result_urls(html, 10);
    assert_eq!(
        urls,
        vec![
            "https://loja1.com.br/tintas".to_string(),
            "https://loja2.com.br/".to_string(),
        ]
    );
}

#[test]
fn extracts_absolute_hrefs() {
    let html = r#"<a class="result" href="https://tintasbrasil.com.br/azul">Tintas Brasil</a>"#;
    let urls = extract_result_urls(html, 10);
    assert_eq!(urls, vec!["https://tintasbrasil.com.br/azul".to_string()]);
}

#[test]
fn skips_search_engine_internal_hosts() {
    let html = r#"
        <a href="https://www.google.com/preferences">Settings</a>
        <a href="https://maps.google.com/maps?q=x">Maps</a>
        <a href="https://loja.com.br/">Loja</a>
    "#;
    let urls = extract_result_urls(html, 10);
    assert_eq!(urls, vec!["https://loja.com.br/".to_string()]);
}

#[test]
fn deduplicates_preserving_first_occurrence() {
    let html = r#"
        <a href="https://loja.com.br/">Loja</a>
        <a href="https://loja.com.br/">Loja again</a>
        <a href="https://outra.com.br/">Outra</a>
    "#;
    let urls = extract_result_urls(html, 10);
    assert_eq!(
        urls,
        vec![
            "https://loja.com.br/".to_string(),
            "https://outra.com.br/".to_string(),
        ]
    );
}

#[test]
fn truncates_to_max_results() {
    let html = r#"
        <a href="https://a.com.br/">a</a>
        <a href="https://b.com.br/">b</a>
        <a href="https://c.com.br/">c</a>
        <a href="https://d.com.br/">d</a>
    "#;
    let urls = extract_result_urls(html, 3);
    assert_eq!(urls.len(), 3);
    assert_eq!(urls[0], "https://a.com.br/");
}

#[test]
fn empty_page_yields_no_urls() {
    assert!(extract_result_urls("<html><body>Sem resultados</body></html>", 3).is_empty());
}
