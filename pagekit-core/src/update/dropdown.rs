use crate::dispatch::DropdownIntent;
use crate::page::Page;

pub fn update(page: &mut Page, msg: DropdownIntent) {
    match msg {
        DropdownIntent::Toggle { dropdown } => page.dropdowns.toggle(&mut page.doc, dropdown),

        DropdownIntent::Select { dropdown, index } => {
            if let Some(change) = page.dropdowns.select(&mut page.doc, dropdown, index) {
                page.notify_change(&change);
            }
        }

        DropdownIntent::CloseAll => page.dropdowns.close_all(&mut page.doc),
    }
}
