use crate::{
    data::user::User,
    flash::{FlashLevel, FlashMessage},
    validation::SelectOption,
};
use maud::{Markup, Render, html};

pub fn render_table<const N: usize>(
    overall_title: &'static str,
    titles: [&'static str; N],
    items: Vec<[Markup; N]>,
) -> Markup {
    html! {
        div class="container mx-auto" {
            (title(overall_title))
            div class="overflow-x-auto" {
                table class="min-w-full bg-gray-800 rounded shadow-md" {
                    thead class="bg-gray-700" {
                        tr {
                            @for title in titles {
                                th class="py-2 px-4 text-left font-semibold text-gray-300" {(title)}
                            }
                        }
                    }
                    tbody {
                        @for row in items {
                            tr {
                                @for col in row {
                                    td class="py-2 px-4 border-b border-gray-600 text-gray-200" {(col)}
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn supertitle(s: impl Render) -> Markup {
    html! {
        h1 class="text-3xl font-bold mb-6 text-center" {(s)}
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";

pub fn form_element(id: &'static str, label: &'static str, inner: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (inner)
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    required: bool,
    input_type: Option<&str>,
    value: Option<&str>,
) -> Markup {
    form_element(id, label, html! {
        input required[required] type=(input_type.unwrap_or("text")) id=(id) name=(id) value=[value] class=(INPUT_CLASSES) {}
    })
}

pub fn select_form_element<T: SelectOption>(
    id: &'static str,
    label: &'static str,
    selected: Option<T>,
) -> Markup {
    form_element(id, label, html! {
        select id=(id) name=(id) class=(INPUT_CLASSES) {
            @for option in T::ALL {
                option value=(option.as_str()) selected[selected.is_some_and(|s| s.as_str() == option.as_str())] {
                    (option.as_str())
                }
            }
        }
    })
}

pub fn form_submit_button(text: Option<&str>) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (text.unwrap_or("Submit"))
            }
        }
    }
}

pub fn errors_list<'a>(
    heading: Option<&str>,
    items: impl IntoIterator<Item = &'a str>,
) -> Markup {
    html! {
        div role="alert" class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" {
            strong class="font-bold" {(heading.unwrap_or("Alert!"))}
            ul class="list-disc list-inside" {
                @for item in items {
                    li {(item)}
                }
            }
        }
    }
}

pub fn flash_banners(flashes: &[FlashMessage]) -> Markup {
    html! {
        @for flash in flashes {
            @match flash.level {
                FlashLevel::Success => {
                    div role="alert" class="bg-green-100 border border-green-400 text-green-700 px-4 py-3 rounded relative mb-4" {
                        (flash.message)
                    }
                }
                FlashLevel::Error => {
                    div role="alert" class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" {
                        (flash.message)
                    }
                }
            }
        }
    }
}

pub fn render_nav(user: Option<User>) -> Markup {
    html! {
        nav class="w-full bg-gray-800 px-6 py-3 mb-4 flex flex-row items-center justify-between shadow-md" {
            a href="/" class="text-xl font-bold" {"Student Management"}
            div class="flex flex-row items-center space-x-4" {
                @if let Some(user) = user {
                    a href="/dashboard" class="hover:underline" {"Dashboard"}
                    a href="/students" class="hover:underline" {"Students"}
                    a href="/roll_numbers" class="hover:underline" {"Roll Numbers"}
                    span class="text-gray-400" {(user)}
                    form method="post" action="/logout" class="inline" {
                        button type="submit" class="bg-slate-600 hover:bg-slate-800 font-bold py-1 px-3 rounded" {"Logout"}
                    }
                } @else {
                    a href="/login" class="bg-blue-600 hover:bg-blue-800 font-bold py-1 px-3 rounded" {"Login"}
                }
            }
        }
    }
}

/// The breadcrumb trail for a request path: `Home`, then one crumb per path
/// segment, each linking to the accumulated prefix.
pub fn breadcrumb_trail(path: &str) -> Vec<(String, String)> {
    fn label(segment: &str) -> String {
        segment
            .split(['_', '-'])
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    let mut crumbs = vec![("Home".to_string(), "/".to_string())];
    let mut href = String::new();
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        href.push('/');
        href.push_str(segment);
        crumbs.push((label(segment), href.clone()));
    }
    crumbs
}

pub fn render_breadcrumbs(path: &str) -> Markup {
    let crumbs = breadcrumb_trail(path);
    let last = crumbs.len() - 1;

    html! {
        nav class="text-sm text-gray-400 mb-4" {
            @for (index, (label, href)) in crumbs.iter().enumerate() {
                @if index > 0 {
                    span class="mx-1" {"/"}
                }
                @if index == last {
                    span class="text-gray-200" {(label)}
                } @else {
                    a href=(href) class="hover:underline" {(label)}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadcrumb_trail_starts_at_home() {
        assert_eq!(
            breadcrumb_trail("/"),
            vec![("Home".to_string(), "/".to_string())]
        );
    }

    #[test]
    fn test_breadcrumb_trail_accumulates_hrefs() {
        let crumbs = breadcrumb_trail("/students");
        assert_eq!(
            crumbs,
            vec![
                ("Home".to_string(), "/".to_string()),
                ("Students".to_string(), "/students".to_string()),
            ]
        );
    }

    #[test]
    fn test_breadcrumb_trail_titlecases_separators() {
        let crumbs = breadcrumb_trail("/roll_numbers");
        assert_eq!(crumbs[1].0, "Roll Numbers");
        assert_eq!(crumbs[1].1, "/roll_numbers");
    }
}
