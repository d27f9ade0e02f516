use crate::dispatch::NavigationIntent;
use crate::page::Page;

pub fn update(page: &mut Page, msg: NavigationIntent) {
    let Some(nav) = page.nav.as_mut() else {
        return;
    };
    match msg {
        NavigationIntent::Toggle => nav.toggle(&mut page.doc, &mut page.lock),
        NavigationIntent::Close => nav.close(&mut page.doc, &mut page.lock),
    }
}
