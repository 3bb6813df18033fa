use rust_decimal::Decimal;
use serp_offers::{
    extract, ContainerKind, Currency, ExtractedRecord, FintechCompactness, FintechKind, PriceBarometer,
};

fn single(html: &str) -> ExtractedRecord {
    let mut records = extract(html).expect("extraction failed");
    assert_eq!(records.len(), 1, "expected exactly one record");
    records.remove(0)
}

#[test]
fn product_card_fields() {
    let record = single(
        r#"<html><body>
        <div class="EProductSnippet2 EProductSnippet2_view_grid">
          <a class="EProductSnippet2-Overlay" href="//market.example.ru/product/42"></a>
          <div class="EProductSnippet2-Thumb"><img class="EThumb-Image" src="//avatars.example.net/get-mpic/42/orig"></div>
          <div class="EProductSnippet2-Title">Смартфон Alpha 128 ГБ, черный</div>
          <div class="EPriceGroup">
            <div class="EPrice EPrice_view_old"><span class="EPrice-Value">15&nbsp;990</span><span class="EPrice-Currency">₽</span></div>
            <div class="EPrice EPrice_size_m"><span class="EPrice-Value">12&nbsp;990</span><span class="EPrice-Currency">₽</span></div>
            <div class="LabelDiscount"><span class="Label-Content">−19%</span></div>
            <div class="EPriceBarometer EPriceBarometer-Cheap"></div>
            <div class="Fintech Fintech_type_split Fintech_view_extra-long"><span class="Fintech-Icon"></span>Сплит частями по 3 247 ₽</div>
          </div>
          <div class="EShopName"><span>Alpha Store</span><span class="OfficialShop">Официальный магазин</span></div>
          <div class="ShopInfo-Ugc">4.8 · 12 отзывов</div>
          <div class="EDeliveryGroup">
            <span class="EDeliveryGroup-Item">Курьером, завтра</span>
            <span class="EDeliveryGroup-Item">Самовывоз, 2 дня</span>
          </div>
        </div>
        </body></html>"#,
    );

    assert_eq!(record.index, 0);
    assert_eq!(record.snippet_type, "EProductSnippet2");
    assert_eq!(record.kind, ContainerKind::ProductSnippet);
    assert_eq!(record.title.as_deref(), Some("Смартфон Alpha 128 ГБ, черный"));
    assert_eq!(record.current_price, Some(Decimal::from(12990)));
    assert_eq!(record.old_price, Some(Decimal::from(15990)));
    assert_eq!(record.currency, Some(Currency::Rub));
    assert_eq!(record.discount_percent, Some(19));
    assert_eq!(record.shop_name.as_deref(), Some("Alpha Store"));
    assert!(record.is_official_shop);
    assert_eq!(record.rating.as_deref(), Some("4.8"));
    assert_eq!(record.shop_rating.as_deref(), Some("4.8"));
    assert_eq!(record.product_rating, None);
    assert_eq!(record.reviews_count, Some(12));
    assert_eq!(record.delivery_options, vec!["Курьером, завтра", "Самовывоз, 2 дня"]);
    assert_eq!(
        record.image_url.as_deref(),
        Some("https://avatars.example.net/get-mpic/42/orig")
    );
    assert_eq!(
        record.product_url.as_deref(),
        Some("https://market.example.ru/product/42")
    );
    assert_eq!(record.price_barometer, Some(PriceBarometer::BelowMarket));

    let fintech = record.fintech.expect("fintech badge");
    assert_eq!(fintech.kind, FintechKind::Split);
    assert_eq!(fintech.compactness, FintechCompactness::ExtraLong);
}

#[test]
fn old_price_is_never_current() {
    let record = single(
        r#"<div class="EShopItem">
             <div class="EPrice EPrice_view_old"><span class="EPrice-Value">990</span></div>
           </div>"#,
    );
    assert_eq!(record.current_price, None);
    assert_eq!(record.old_price, Some(Decimal::from(990)));
}

#[test]
fn current_price_found_after_old_price() {
    let record = single(
        r#"<div class="EShopItem">
             <div class="EPrice EPrice_view_old"><span class="EPrice-Value">2 490</span></div>
             <div class="EPrice"><span class="EPrice-Value">1 990</span></div>
           </div>"#,
    );
    assert_eq!(record.current_price, Some(Decimal::from(1990)));
    assert_eq!(record.old_price, Some(Decimal::from(2490)));
    assert_ne!(record.current_price, record.old_price);
}

#[test]
fn discount_minus_sign_variants() {
    for label in ["−15%", "-15%", "–15 %", "—15", "15%"] {
        let html = format!(
            r#"<div class="EShopItem"><div class="LabelDiscount"><div class="Label-Content">{label}</div></div></div>"#
        );
        assert_eq!(single(&html).discount_percent, Some(15), "{label}");
    }
}

#[test]
fn official_shop_without_marker() {
    let record = single(
        r#"<div class="EShopItem"><div class="EShopName">Маркет Плюс</div></div>"#,
    );
    assert_eq!(record.shop_name.as_deref(), Some("Маркет Плюс"));
    assert!(!record.is_official_shop);
}

#[test]
fn organic_shop_falls_back_to_path() {
    let record = single(
        r#"<li class="serp-item"><div class="Organic Organic_withOfferInfo">
             <h2 class="OrganicTitle"><a href="https://www.shop.example.ru/item">Чайник</a></h2>
             <div class="Path"><a>www.shop.example.ru</a> › <a>kitchen</a></div>
           </div></li>"#,
    );
    assert_eq!(record.kind, ContainerKind::Organic);
    assert_eq!(record.shop_name.as_deref(), Some("shop.example.ru"));
    assert_eq!(record.host.as_deref(), Some("shop.example.ru"));
    assert_eq!(record.product_url.as_deref(), Some("https://www.shop.example.ru/item"));
}

#[test]
fn shop_name_ignores_siblings_after_marker() {
    let record = single(
        r#"<div class="EShopItem"><div class="EShopName">
             <span class="Line-AddonContent">Apple Store</span>
             <span class="OfficialShop">Официальный магазин</span>
             <span class="EShopName-Meta">Москва</span>
           </div></div>"#,
    );
    assert_eq!(record.shop_name.as_deref(), Some("Apple Store"));
    assert!(record.is_official_shop);
}

#[test]
fn official_marker_without_name_is_still_official() {
    let record = single(
        r#"<div class="EShopItem"><div class="EShopName"><span class="OfficialShop">Официальный магазин</span></div></div>"#,
    );
    assert_eq!(record.shop_name, None);
    assert!(record.is_official_shop);
}

#[test]
fn grouped_price_with_comma_is_whole() {
    let record = single(
        r#"<div class="EShopItem"><div class="EPrice"><span class="EPrice-Value">$1,299</span></div></div>"#,
    );
    assert_eq!(record.current_price, Some(Decimal::from(1299)));
    assert_eq!(record.currency, Some(Currency::Usd));
}

#[test]
fn organic_result_extras() {
    let record = single(
        r#"<li class="serp-item"><div class="Organic Organic_withOfferInfo">
             <h2 class="OrganicTitle"><a href="https://www.citilink.ru/p/1">Телевизор</a></h2>
             <div class="Path"><a class="Path-Item" href="https://www.citilink.ru/">citilink.ru</a> › tv</div>
             <span class="Verified Verified_type_goods"></span>
             <div class="ELabelRating"><span class="Label-Content">4,6</span></div>
             <div class="Rating">4.9</div>
             <div class="EReviewsLabel">1,2К отзывов</div>
             <span class="OrganicTextContentSpan">Доставка   по всей России</span>
             <div class="EMarketCheckoutLabel">Покупки</div>
           </div></li>"#,
    );
    assert_eq!(record.host.as_deref(), Some("citilink.ru"));
    assert_eq!(record.product_rating.as_deref(), Some("4,6"));
    assert_eq!(record.shop_rating.as_deref(), Some("4.9"));
    assert_eq!(record.rating.as_deref(), Some("4,6"));
    assert_eq!(record.reviews_count, Some(1200));
    assert_eq!(record.description.as_deref(), Some("Доставка по всей России"));
    assert!(record.is_verified);
    assert!(record.has_checkout);
}

#[test]
fn missing_fields_are_absent() {
    let record = single(r#"<div class="EOfferItem"></div>"#);
    assert_eq!(record.kind, ContainerKind::OfferItem);
    assert_eq!(record.title, None);
    assert_eq!(record.current_price, None);
    assert_eq!(record.old_price, None);
    assert_eq!(record.discount_percent, None);
    assert_eq!(record.shop_name, None);
    assert!(!record.is_official_shop);
    assert_eq!(record.rating, None);
    assert_eq!(record.product_rating, None);
    assert_eq!(record.shop_rating, None);
    assert_eq!(record.reviews_count, None);
    assert_eq!(record.host, None);
    assert_eq!(record.description, None);
    assert!(!record.is_verified);
    assert!(!record.has_checkout);
    assert!(record.delivery_options.is_empty());
    assert_eq!(record.image_url, None);
    assert_eq!(record.fintech, None);
    assert_eq!(record.price_barometer, None);
    assert_eq!(record.favicon, None);
}

#[test]
fn hidden_delivery_items_are_skipped() {
    let record = single(
        r#"<div class="EShopItem"><div class="EDeliveryGroup">
             <span class="EDeliveryGroup-Item">Почта России</span>
             <span class="A11yHidden"><span class="EDeliveryGroup-Item">Доставка:</span></span>
           </div></div>"#,
    );
    assert_eq!(record.delivery_options, vec!["Почта России"]);
}

#[test]
fn fintech_pay_badge() {
    let record = single(
        r#"<div class="EShopItem"><div class="Fintech Fintech_type_yandexPay">Пэй −10%</div></div>"#,
    );
    let fintech = record.fintech.expect("fintech badge");
    assert_eq!(fintech.kind, FintechKind::Pay);
    assert_eq!(fintech.compactness, FintechCompactness::Default);
    assert_eq!(fintech.provider.as_deref(), Some("yandexPay"));
}

#[test]
fn records_serialize_to_json() {
    let record = single(
        r#"<div class="EShopItem">
             <div class="EShopItem-Title">Чайник</div>
             <div class="EPrice"><span class="EPrice-Value">1 299,50</span> ₽</div>
             <div class="EPriceBarometer EPriceBarometer_type_above-market"></div>
           </div>"#,
    );
    let json = serde_json::to_value(&record).expect("serializable");
    assert_eq!(json["title"], "Чайник");
    assert_eq!(json["current_price"], "1299.50");
    assert_eq!(json["currency"], "rub");
    assert_eq!(json["kind"], "shop_item");
    assert_eq!(json["price_barometer"], "above-market");
}
