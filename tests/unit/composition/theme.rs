use super::*;

#[test]
fn themes_have_distinct_backgrounds() {
    assert_eq!(Theme::Light.colors().background, "#ffffff");
    assert_eq!(Theme::Dim.colors().background, "#15202b");
    assert_eq!(Theme::LightsOut.colors().background, "#000000");
}

#[test]
fn first_avatar_has_its_own_color_and_others_cycle() {
    assert_eq!(avatar_color(0), FIRST_AVATAR_COLOR);
    assert_eq!(avatar_color(1), AVATAR_COLORS[1]);
    assert_eq!(avatar_color(21), AVATAR_COLORS[1]);
    assert_eq!(filler_color(20), AVATAR_COLORS[0]);
}

#[test]
fn seed_is_percent_encoded() {
    assert_eq!(
        generated_avatar_url("Ada Lovelace/é"),
        "https://api.dicebear.com/7.x/avataaars/svg?seed=Ada%20Lovelace%2F%C3%A9"
    );
    assert!(generated_avatar_url("o'neil(1)~").ends_with("seed=o'neil(1)~"));
}

#[test]
fn provided_image_wins_over_generated() {
    let with_image = Entity {
        name: "ada".to_owned(),
        image: Some("https://img/ada.png".to_owned()),
        verified: None,
    };
    assert_eq!(
        avatar_image(Some(&with_image), 3),
        AvatarImage::Provided("https://img/ada.png".to_owned())
    );
}

#[test]
fn missing_or_empty_image_falls_back_to_name_then_index() {
    let empty_image = Entity {
        name: "bob".to_owned(),
        image: Some(String::new()),
        verified: None,
    };
    assert_eq!(avatar_image(Some(&empty_image), 3).url(), generated_avatar_url("bob"));
    assert_eq!(
        avatar_image(Some(&Entity::named("")), 7).url(),
        generated_avatar_url("7")
    );
    assert_eq!(avatar_image(None, 4).url(), generated_avatar_url("4"));
    assert_eq!(filler_image(9).url(), generated_avatar_url("filler-9"));
}
