//! Sample newsletter loaded into the editor when no file is given.

/// A complete single-column newsletter.
pub const DEFAULT_NEWSLETTER: &str = r##"<mjml>
  <mj-head>
    <mj-title>Riverside Community Garden - Spring Newsletter</mj-title>
    <mj-preview>Planting day, new plots, and volunteer hours for spring.</mj-preview>
    <mj-attributes>
      <mj-all font-family="Open Sans, Arial, sans-serif" />
      <mj-text font-size="16px" line-height="24px" color="#1f2933" />
    </mj-attributes>
  </mj-head>

  <mj-body background-color="#f4f7f2">

    <!-- HEADER -->
    <mj-section background-color="#2f6b3b" padding="20px">
      <mj-column>
        <mj-text align="center" font-size="14px" color="#dfeee2">
          Spring Newsletter
        </mj-text>
        <mj-text align="center" font-size="28px" font-weight="bold" color="#ffffff">
          Riverside Community Garden
        </mj-text>
      </mj-column>
    </mj-section>

    <!-- BODY -->
    <mj-section background-color="#ffffff" padding="20px">
      <mj-column>
        <mj-text align="center" font-size="20px" font-weight="bold" padding-bottom="10px">
          Planting Day is April 12th
        </mj-text>
        <mj-text align="center">
          Bring gloves and a friend. Seedlings, compost, and tools are provided,
          and the first twenty volunteers get a free packet of heirloom tomato seeds.
        </mj-text>
        <mj-button background-color="#2f6b3b" color="#ffffff" font-size="16px" font-weight="bold" href="#">
          SIGN UP TO VOLUNTEER
        </mj-button>
      </mj-column>
    </mj-section>

    <!-- FOOTER -->
    <mj-section background-color="#ffffff" padding="20px">
      <mj-column>
        <mj-divider border-color="#e0e0e0" />
        <mj-text font-size="12px" color="#777777" align="center">
          You are receiving this because you joined the Riverside Community Garden mailing list.
          <a href="#" style="color:#2f6b3b;">Unsubscribe</a>.
        </mj-text>
      </mj-column>
    </mj-section>

  </mj-body>
</mjml>"##;

#[cfg(test)]
mod tests {
    use super::DEFAULT_NEWSLETTER;
    use crate::convert::unknown_elements;

    #[test]
    fn test_sample_uses_only_registered_elements() {
        assert!(unknown_elements(DEFAULT_NEWSLETTER).is_empty());
    }

    #[test]
    fn test_sample_is_a_complete_document() {
        assert!(DEFAULT_NEWSLETTER.trim_start().starts_with("<mjml>"));
        assert!(DEFAULT_NEWSLETTER.trim_end().ends_with("</mjml>"));
    }
}
