pub const SUPPORT_ISSUES_URL: &str = "https://github.com/imjamesonzeller/tasklight-v3/issues";
pub const SUPPORT_MAILTO: &str = "mailto:jameson@jamesonzeller.com?subject=Tasklight%20support";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpView {
    About,
    Acknowledgements,
    ResetConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpState {
    Closed,
    Root,
    Detail(HelpView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    About,
    Acknowledgements,
    ResetCache,
    ReportBug,
    ContactSupport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEffect {
    Navigate,
    OpenUrl(&'static str),
    ComposeMail(&'static str),
    Ignored,
}

pub struct HelpNavigator {
    state: HelpState,
}

impl HelpNavigator {
    pub fn new() -> Self {
        Self {
            state: HelpState::Closed,
        }
    }

    pub fn state(&self) -> HelpState {
        self.state
    }

    pub fn open(&mut self) {
        self.state = HelpState::Root;
    }

    pub fn close(&mut self) {
        self.state = HelpState::Closed;
    }

    pub fn select(&mut self, item: MenuItem) -> MenuEffect {
        if self.state != HelpState::Root {
            return MenuEffect::Ignored;
        }
        match item {
            MenuItem::About => {
                self.state = HelpState::Detail(HelpView::About);
                MenuEffect::Navigate
            }
            MenuItem::Acknowledgements => {
                self.state = HelpState::Detail(HelpView::Acknowledgements);
                MenuEffect::Navigate
            }
            MenuItem::ResetCache => {
                self.state = HelpState::Detail(HelpView::ResetConfirm);
                MenuEffect::Navigate
            }
            MenuItem::ReportBug => MenuEffect::OpenUrl(SUPPORT_ISSUES_URL),
            MenuItem::ContactSupport => MenuEffect::ComposeMail(SUPPORT_MAILTO),
        }
    }

    pub fn back(&mut self) {
        self.state = match self.state {
            HelpState::Detail(_) => HelpState::Root,
            HelpState::Root => HelpState::Closed,
            HelpState::Closed => HelpState::Closed,
        };
    }

    // On a failed reset the caller leaves the navigator alone so the confirm
    // view can show the error inline.
    pub fn reset_succeeded(&mut self) {
        if self.state == HelpState::Detail(HelpView::ResetConfirm) {
            self.state = HelpState::Closed;
        }
    }
}

impl Default for HelpNavigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn informational_items_navigate_to_their_detail_view() {
        let mut nav = HelpNavigator::new();
        nav.open();

        assert_eq!(nav.select(MenuItem::About), MenuEffect::Navigate);
        assert_eq!(nav.state(), HelpState::Detail(HelpView::About));

        nav.back();
        assert_eq!(nav.select(MenuItem::Acknowledgements), MenuEffect::Navigate);
        assert_eq!(nav.state(), HelpState::Detail(HelpView::Acknowledgements));
    }

    #[test]
    fn external_items_return_effects_without_leaving_root() {
        let mut nav = HelpNavigator::new();
        nav.open();

        assert_eq!(
            nav.select(MenuItem::ReportBug),
            MenuEffect::OpenUrl(SUPPORT_ISSUES_URL)
        );
        assert_eq!(nav.state(), HelpState::Root);

        assert_eq!(
            nav.select(MenuItem::ContactSupport),
            MenuEffect::ComposeMail(SUPPORT_MAILTO)
        );
        assert_eq!(nav.state(), HelpState::Root);
    }

    #[test]
    fn selections_are_ignored_outside_the_root_menu() {
        let mut nav = HelpNavigator::new();
        assert_eq!(nav.select(MenuItem::About), MenuEffect::Ignored);

        nav.open();
        nav.select(MenuItem::ResetCache);
        assert_eq!(nav.select(MenuItem::About), MenuEffect::Ignored);
        assert_eq!(nav.state(), HelpState::Detail(HelpView::ResetConfirm));
    }

    #[test]
    fn back_walks_detail_to_root_to_closed() {
        let mut nav = HelpNavigator::new();
        nav.open();
        nav.select(MenuItem::About);

        nav.back();
        assert_eq!(nav.state(), HelpState::Root);
        nav.back();
        assert_eq!(nav.state(), HelpState::Closed);
        nav.back();
        assert_eq!(nav.state(), HelpState::Closed);
    }

    #[test]
    fn reset_success_dismisses_the_modal_entirely() {
        let mut nav = HelpNavigator::new();
        nav.open();
        nav.select(MenuItem::ResetCache);

        nav.reset_succeeded();
        assert_eq!(nav.state(), HelpState::Closed);
    }

    #[test]
    fn reset_success_is_a_no_op_elsewhere() {
        let mut nav = HelpNavigator::new();
        nav.open();
        nav.reset_succeeded();
        assert_eq!(nav.state(), HelpState::Root);
    }
}
